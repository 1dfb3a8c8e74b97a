pub mod dmic_driver;
