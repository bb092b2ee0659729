pub mod measure_time;
