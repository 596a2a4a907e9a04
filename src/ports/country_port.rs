//! Country resolution port trait.

/// Maps an upstream country/region name to a country code.
pub trait CountryResolver {
    fn resolve(&self, name: &str) -> Option<String>;
}
