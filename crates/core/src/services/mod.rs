pub mod analytics_service;
pub mod holdings_provider;
