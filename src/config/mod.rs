//! Configuration module

mod prismic;
mod site;

pub use prismic::PrismicSettings;
pub use site::HomeConfig;
pub use site::PrismicSection;
pub use site::SiteConfig;
