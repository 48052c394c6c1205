pub mod sync_bridge;
