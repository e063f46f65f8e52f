mod catalog;

pub use catalog::MessageCatalog;
