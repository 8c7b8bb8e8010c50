pub mod fetcher;
pub mod traits;

pub use fetcher::FetcherImpl;
pub use traits::Fetcher;
