#[derive(Debug)]
pub enum GeoError {
    /// Longitude or latitude outside its valid range.
    InvalidCoordinate(f64, f64),
    /// UTM zones run from 1 to 60.
    InvalidZone(u8),
}
