pub mod test_room_negotiation_relay;
