//! Shared helpers for building synthetic DICOM instances in tests

use crate::instance::{DicomInstance, EXPLICIT_VR_LITTLE_ENDIAN};
use crate::tags;
use dicom_core::{DataElement, PrimitiveValue, VR};
use dicom_dictionary_std::StandardDataDictionary;
use dicom_object::{DefaultDicomObject, FileDicomObject, FileMetaTableBuilder, InMemDicomObject};

/// Wraps a dataset into a file-backed object with Explicit VR LE meta
pub fn file_object(dataset: InMemDicomObject) -> DefaultDicomObject {
    file_object_with_syntax(dataset, EXPLICIT_VR_LITTLE_ENDIAN)
}

/// Wraps a dataset into a file-backed object with the given transfer syntax
pub fn file_object_with_syntax(
    dataset: InMemDicomObject,
    transfer_syntax: &str,
) -> DefaultDicomObject {
    let meta = FileMetaTableBuilder::new()
        .transfer_syntax(transfer_syntax)
        .media_storage_sop_class_uid("1.2.840.10008.5.1.4.1.1.7")
        .media_storage_sop_instance_uid("1.2.276.0.7230010.3.1.4.0.1")
        .build()
        .expect("valid file meta");
    let mut obj = FileDicomObject::new_empty_with_dict_and_meta(StandardDataDictionary, meta);
    for elem in dataset {
        obj.put(elem);
    }
    obj
}

fn put_image_module(
    dataset: &mut InMemDicomObject,
    rows: u16,
    cols: u16,
    samples: u16,
    bits: u16,
    interpretation: &str,
) {
    dataset.put(DataElement::new(
        tags::ROWS,
        VR::US,
        PrimitiveValue::from(rows),
    ));
    dataset.put(DataElement::new(
        tags::COLUMNS,
        VR::US,
        PrimitiveValue::from(cols),
    ));
    dataset.put(DataElement::new(
        tags::SAMPLES_PER_PIXEL,
        VR::US,
        PrimitiveValue::from(samples),
    ));
    dataset.put(DataElement::new(
        tags::BITS_ALLOCATED,
        VR::US,
        PrimitiveValue::from(bits),
    ));
    dataset.put(DataElement::new(
        tags::BITS_STORED,
        VR::US,
        PrimitiveValue::from(bits),
    ));
    dataset.put(DataElement::new(
        tags::PIXEL_REPRESENTATION,
        VR::US,
        PrimitiveValue::from(0u16),
    ));
    dataset.put(DataElement::new(
        tags::PHOTOMETRIC_INTERPRETATION,
        VR::CS,
        PrimitiveValue::from(interpretation),
    ));
}

/// Monochrome 8-bit dataset with row-major pixel values
pub fn gray_dataset(rows: u16, cols: u16, pixels: Vec<u8>) -> InMemDicomObject {
    assert_eq!(pixels.len(), rows as usize * cols as usize);
    let mut dataset = InMemDicomObject::new_empty();
    put_image_module(&mut dataset, rows, cols, 1, 8, "MONOCHROME2");
    let mut pixels = pixels;
    if pixels.len() % 2 == 1 {
        pixels.push(0);
    }
    dataset.put(DataElement::new(
        tags::PIXEL_DATA,
        VR::OB,
        PrimitiveValue::from(pixels),
    ));
    dataset
}

/// Monochrome 16-bit dataset with row-major pixel values
pub fn gray16_dataset(rows: u16, cols: u16, pixels: Vec<u16>) -> InMemDicomObject {
    assert_eq!(pixels.len(), rows as usize * cols as usize);
    let mut dataset = InMemDicomObject::new_empty();
    put_image_module(&mut dataset, rows, cols, 1, 16, "MONOCHROME2");
    let bytes: Vec<u8> = pixels.iter().flat_map(|v| v.to_le_bytes()).collect();
    dataset.put(DataElement::new(
        tags::PIXEL_DATA,
        VR::OW,
        PrimitiveValue::from(bytes),
    ));
    dataset
}

/// RGB 8-bit dataset with interleaved channel values
pub fn rgb_dataset(rows: u16, cols: u16, pixels: Vec<u8>) -> InMemDicomObject {
    assert_eq!(pixels.len(), rows as usize * cols as usize * 3);
    let mut dataset = InMemDicomObject::new_empty();
    put_image_module(&mut dataset, rows, cols, 3, 8, "RGB");
    let mut pixels = pixels;
    if pixels.len() % 2 == 1 {
        pixels.push(0);
    }
    dataset.put(DataElement::new(
        tags::PIXEL_DATA,
        VR::OB,
        PrimitiveValue::from(pixels),
    ));
    dataset
}

/// Monochrome instance with 8 bits allocated
pub fn gray_instance(rows: u16, cols: u16, pixels: Vec<u8>) -> DicomInstance {
    DicomInstance::new(file_object(gray_dataset(rows, cols, pixels)))
        .expect("valid grayscale instance")
}

/// Monochrome instance with 16 bits allocated
pub fn gray16_instance(rows: u16, cols: u16, pixels: Vec<u16>) -> DicomInstance {
    DicomInstance::new(file_object(gray16_dataset(rows, cols, pixels)))
        .expect("valid grayscale instance")
}

/// RGB instance with 8 bits allocated
pub fn rgb_instance(rows: u16, cols: u16, pixels: Vec<u8>) -> DicomInstance {
    DicomInstance::new(file_object(rgb_dataset(rows, cols, pixels))).expect("valid RGB instance")
}
