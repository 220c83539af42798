pub mod comparison_cache;
