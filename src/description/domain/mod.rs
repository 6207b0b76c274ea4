//! Description locations and document metadata.

mod location;
mod servers;

pub use location::DescriptionLocation;
pub use servers::declared_base_url;
