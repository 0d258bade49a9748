pub mod command_producer;

pub use command_producer::CommandProducer;
