// generative core of the city
// pure computation over CityState, no ECS access in here

pub mod color;
pub mod layout;
pub mod raster;
pub mod roof_lights;
pub mod sky;
pub mod state;
pub mod windows;
