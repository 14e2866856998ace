pub mod connector;

#[cfg(test)]
pub mod mock;

pub use connector::Connector;
