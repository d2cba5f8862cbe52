pub mod contact;
pub mod locale;
pub mod option_fields;
pub mod project;
pub mod seo;
pub mod site_content;
pub mod token;
