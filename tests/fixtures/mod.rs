//! Test fixtures for herb batch submissions

#![allow(dead_code)]

/// A complete herb batch submission, as typed into the form.
#[derive(Debug, Clone)]
pub struct BatchFixture {
    pub herb_name: &'static str,
    pub batch_id: &'static str,
    pub source_location: &'static str,
    pub collection_timestamp: &'static str,
    pub processing_details: &'static str,
    pub supplier_details: &'static str,
    pub manufacturer_details: &'static str,
    pub photo_bytes: usize,
}

impl BatchFixture {
    /// Text fields by their form names, in form order.
    pub fn fields(&self) -> [(&'static str, &'static str); 7] {
        [
            ("herbName", self.herb_name),
            ("batchId", self.batch_id),
            ("sourceLocation", self.source_location),
            ("collectionTimestamp", self.collection_timestamp),
            ("processingDetails", self.processing_details),
            ("supplierDetails", self.supplier_details),
            ("manufacturerDetails", self.manufacturer_details),
        ]
    }
}

/// Happy-path batch: every field valid, 200 KB JPEG.
pub const ASHWAGANDHA: BatchFixture = BatchFixture {
    herb_name: "Ashwagandha",
    batch_id: "B-001",
    source_location: "18.5204, 73.8567",
    collection_timestamp: "2024-01-15T10:30:00.000Z",
    processing_details: "Sun-dried for 5 days",
    supplier_details: "Local cooperative XYZ",
    manufacturer_details: "Herbal Labs Pvt Ltd",
    photo_bytes: 200 * 1024,
};

/// A fake JPEG of `len` bytes: valid magic, zero padding.
pub fn jpeg_photo(len: usize) -> Vec<u8> {
    let mut bytes = vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F', 0x00];
    bytes.resize(len.max(bytes.len()), 0);
    bytes
}

pub const MIB: usize = 1024 * 1024;

pub const STUB_REPORT: &str = "Ashwagandha batch B-001 was hand-harvested near Pune on 15 January 2024.\n\nThe roots were sun-dried for five days before reaching Herbal Labs.";
