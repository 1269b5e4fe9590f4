mod room;
mod room_command;
mod room_manager;

pub use room::Room;
pub use room_command::RoomCommand;
pub use room_manager::RoomManager;
