pub mod hotel;
pub mod parking;
pub mod parking_spot;
pub mod parking_spot_status;
pub mod parking_spot_type;
pub mod spot_type;
pub mod status;
