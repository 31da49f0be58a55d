pub mod catalog;
pub mod config;
pub mod display;
pub mod error;
pub mod favourites;
pub mod fuzzy;
pub mod songsterr;

pub use catalog::{
    AlbumSummary, ArtistSummary, AudioFeatures, Catalog, Credentials, Session, TopTrack,
    TrackIdentity,
};
pub use config::Config;
pub use error::LookupError;
pub use favourites::{FavouriteEntry, Favourites};
pub use songsterr::{TabEntry, TabFinder, TabLocation};
