//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises a node service
//! against mock adapters. All tests run on the host (x86_64) with no
//! real hardware required.

mod camera_node_tests;
mod mock_ports;
mod sensor_hub_tests;
