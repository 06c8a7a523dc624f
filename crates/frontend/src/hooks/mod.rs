mod use_site_key;

pub use use_site_key::use_site_key;
