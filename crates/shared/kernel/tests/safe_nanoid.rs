use autoims_kernel::SAFE_ALPHABET;
use autoims_kernel::safe_nanoid;

#[test]
fn generates_expected_length_and_charset() {
    let id = safe_nanoid!();
    assert_eq!(id.len(), 12);
    assert!(id.chars().all(|ch| SAFE_ALPHABET.contains(&ch)), "unexpected character in {id}");
}

#[test]
fn ids_do_not_repeat() {
    let a = safe_nanoid!(20);
    let b = safe_nanoid!(20);
    assert_eq!(a.len(), 20);
    assert_ne!(a, b);
}
