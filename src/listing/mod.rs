pub mod details;
pub mod filter;
pub mod landing;
pub mod view;

pub use details::PropertyDetailView;
pub use filter::{apply, property_type_choice, FilterConfig, SortKey, PROPERTY_TYPES};
pub use landing::{LandingView, FEATURED_COUNT};
pub use view::PropertyListView;
