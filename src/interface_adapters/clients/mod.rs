pub mod rooms;

pub use rooms::{RoomInfo, RoomsClient, RoomsError};
