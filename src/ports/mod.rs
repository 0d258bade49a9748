/// Ports module defining interfaces for hexagonal architecture
///
/// The pipeline core depends only on these outbound (driven) interfaces.
/// The external collaborators behind them (release tracking store, SBOM
/// producer, archive API, object-store ledger) are adapter concerns.
pub mod outbound;
