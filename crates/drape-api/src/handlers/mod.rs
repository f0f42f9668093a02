pub mod garment_files;
pub mod garment_status;
pub mod health;
