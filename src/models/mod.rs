pub mod filter;

pub use filter::SearchFilter;
