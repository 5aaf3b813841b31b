pub mod notification_sweep;
