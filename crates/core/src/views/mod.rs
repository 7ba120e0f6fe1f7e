pub mod header;
pub mod timeline;
