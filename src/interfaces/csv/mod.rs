pub mod breakdown_writer;
pub mod quote_reader;
