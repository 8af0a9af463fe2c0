pub mod call_weather;
