pub mod city;
pub mod export;
pub mod ui;
