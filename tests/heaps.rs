//! Integration tests for the metadata heaps and the heap offsets a build reports.

use cilmeta::prelude::*;

#[test]
fn test_strings_share_offsets() -> Result<()> {
    let mut heap = StringHeap::new();
    assert_eq!(heap.add("")?, 0);
    assert_eq!(heap.add("Foo")?, 1);
    assert_eq!(heap.add("Bar")?, 5);
    assert_eq!(heap.add("Foo")?, 1);

    assert_eq!(heap.data(), b"\0Foo\0Bar\0");
    assert_eq!(heap.padded_data().len(), 12);
    assert!(heap.add("Fo\0o").is_err());
    Ok(())
}

#[test]
fn test_blob_length_prefixes() -> Result<()> {
    let mut heap = BlobHeap::new();
    assert_eq!(heap.add(&[])?, 0);
    assert_eq!(heap.add(&[0x06, 0x08])?, 1);

    let long = vec![0xAB; 200];
    let offset = heap.add(&long)?;
    assert_eq!(offset, 4);
    assert_eq!(&heap.data()[4..6], &[0x80, 0xC8]);
    assert_eq!(heap.size(), 6 + 200);
    assert_eq!(heap.add(&long)?, 4);
    Ok(())
}

#[test]
fn test_user_string_layout() -> Result<()> {
    let mut heap = UserStringHeap::new();
    assert_eq!(heap.add("Hi")?, 1);
    assert_eq!(heap.add("")?, 7);
    assert_eq!(heap.add("é")?, 9);

    assert_eq!(
        heap.data(),
        &[
            0x00, // null entry
            0x05, b'H', 0x00, b'i', 0x00, 0x00, // "Hi"
            0x01, 0x00, // ""
            0x03, 0xE9, 0x00, 0x01, // "é", terminal byte set
        ]
    );
    assert_eq!(heap.get("Hi"), Some(1));
    Ok(())
}

#[test]
fn test_guids_are_one_based() -> Result<()> {
    let first = uguid::guid!("01234567-89ab-cdef-0123-456789abcdef");
    let second = uguid::guid!("fedcba98-7654-3210-fedc-ba9876543210");

    let mut heap = GuidHeap::new();
    assert_eq!(heap.add_optional(None)?, 0);
    assert_eq!(heap.add(first)?, 1);
    assert_eq!(heap.add(second)?, 2);
    assert_eq!(heap.add(first)?, 1);
    assert_eq!(heap.size(), 32);
    Ok(())
}

#[test]
fn test_build_reports_heap_offsets() -> Result<()> {
    let mut module = ModuleDefinition::new("Literals.dll");
    let hello = module.add_user_string(UserString::new("hello"));
    let again = module.add_user_string(UserString::new("hello"));
    let world = module.add_user_string(UserString::new("world"));
    let blob = module.add_blob(BlobEntry::new(vec![0x01, 0x00]));

    let image = MetadataBuilder::default().build(&mut module)?;

    assert_eq!(module.user_strings[hello].offset, 1);
    assert_eq!(module.user_strings[again].offset, 1);
    assert_eq!(module.user_strings[world].offset, 13);
    assert_eq!(module.user_strings[world].token().value(), 0x7000_000D);
    assert_eq!(module.blobs[blob].offset, 1);

    assert_eq!(image.user_strings().get("world"), Some(13));
    assert_eq!(image.blobs().get(&[0x01, 0x00]), Some(1));
    Ok(())
}

#[test]
fn test_module_row_uses_guid_heap() -> Result<()> {
    let mvid = uguid::guid!("11111111-2222-3333-4444-555555555555");
    let mut module = ModuleDefinition::new("Guid.dll").with_mvid(mvid);
    let image = MetadataBuilder::default().build(&mut module)?;

    let row = image.tables().module.get(1).unwrap();
    assert_eq!(row.mvid, 1);
    assert_eq!(image.strings().get("Guid.dll"), Some(row.name));
    assert_eq!(image.guids().len(), 1);
    assert_eq!(image.table_info().guid_bytes(), 2);
    Ok(())
}
