pub mod calibrate;
pub mod distance_measure;
pub mod drive;
pub mod maneuver;
pub mod navigate;
pub mod remote_control;
pub mod rgb_led_indicate;
pub mod scheduler;
