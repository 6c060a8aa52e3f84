pub mod api_patterns;
