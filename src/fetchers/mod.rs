pub mod fetcher;
pub mod wiki;

pub use fetcher::PageFetcher;
pub use wiki::WikiFetcher;
