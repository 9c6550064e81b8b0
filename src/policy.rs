//! TTL Policy Module
//!
//! Static per-resource-class TTL table. Policy only: callers consult it to
//! pick the TTL they pass into the store, which itself stays TTL-agnostic.

use std::str::FromStr;

// == Resource Class ==
/// Catalog API resource classes with distinct freshness requirements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceClass {
    /// Category tree, effectively static
    Categories,
    /// Subcategory tree, effectively static
    Subcategories,
    /// Evergreen blog content
    StaticBlogs,
    /// Product listings, updated by admins
    Products,
    /// Blog listings
    Blogs,
    /// Customer enquiries
    Enquiries,
    /// User records
    Users,
    /// Dashboard analytics
    Analytics,
    /// Near-real-time counters
    Realtime,
}

impl ResourceClass {
    /// TTL for this class in milliseconds.
    ///
    /// Static data caches long, dynamic data shorter, near-real-time data
    /// barely at all.
    pub fn ttl_ms(self) -> u64 {
        match self {
            Self::Categories | Self::Subcategories => 30 * 60 * 1000,
            Self::StaticBlogs => 60 * 60 * 1000,
            Self::Products | Self::Users => 5 * 60 * 1000,
            Self::Blogs => 10 * 60 * 1000,
            Self::Enquiries => 2 * 60 * 1000,
            Self::Analytics => 30 * 1000,
            Self::Realtime => 10 * 1000,
        }
    }

    /// Canonical name, also used as a conventional cache key prefix.
    pub fn name(self) -> &'static str {
        match self {
            Self::Categories => "categories",
            Self::Subcategories => "subcategories",
            Self::StaticBlogs => "static_blogs",
            Self::Products => "products",
            Self::Blogs => "blogs",
            Self::Enquiries => "enquiries",
            Self::Users => "users",
            Self::Analytics => "analytics",
            Self::Realtime => "realtime",
        }
    }
}

impl FromStr for ResourceClass {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "categories" => Ok(Self::Categories),
            "subcategories" => Ok(Self::Subcategories),
            "static_blogs" => Ok(Self::StaticBlogs),
            "products" => Ok(Self::Products),
            "blogs" => Ok(Self::Blogs),
            "enquiries" => Ok(Self::Enquiries),
            "users" => Ok(Self::Users),
            "analytics" => Ok(Self::Analytics),
            "realtime" => Ok(Self::Realtime),
            _ => Err(()),
        }
    }
}

/// Looks up the policy TTL for a resource-class name, `None` for classes
/// the table does not know.
pub fn ttl_for(class_name: &str) -> Option<u64> {
    class_name.parse::<ResourceClass>().ok().map(ResourceClass::ttl_ms)
}
