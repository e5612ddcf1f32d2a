//! 功能元件模組

pub mod proxy_cache_mover;

pub use proxy_cache_mover::ProxyCacheMover;
