




/// Return address stack ordering and wraparound.
pub mod ras;
