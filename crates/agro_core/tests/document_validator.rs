use agro_core::{is_valid_document, validate_document, DocumentKind, DocumentPolicy};

const VALID_CPFS: [&str; 4] = ["95181040004", "42442756064", "52998224725", "11144477735"];
const VALID_CNPJS: [&str; 3] = ["77759188000180", "55678926000122", "11222333000181"];

#[test]
fn accepts_known_valid_cpfs() {
    for cpf in VALID_CPFS {
        let check = validate_document(Some(cpf), DocumentPolicy::default());
        assert!(check.valid, "{cpf} should be valid");
        assert_eq!(check.kind, Some(DocumentKind::Cpf));
        assert_eq!(check.normalized, cpf);
    }
}

#[test]
fn accepts_known_valid_cnpjs() {
    for cnpj in VALID_CNPJS {
        let check = validate_document(Some(cnpj), DocumentPolicy::default());
        assert!(check.valid, "{cnpj} should be valid");
        assert_eq!(check.kind, Some(DocumentKind::Cnpj));
    }
}

#[test]
fn formatted_input_is_normalized_before_checking() {
    let check = validate_document(Some("951.810.400-04"), DocumentPolicy::default());
    assert!(check.valid);
    assert_eq!(check.normalized, "95181040004");

    let check = validate_document(Some("77.759.188/0001-80"), DocumentPolicy::default());
    assert!(check.valid);
    assert_eq!(check.into_valid(), Some((DocumentKind::Cnpj, "77759188000180".to_string())));
}

#[test]
fn rejects_wrong_check_digits() {
    for raw in ["12345678901", "95181040099", "12345678901234", "77759188000199"] {
        assert!(!is_valid_document(raw), "{raw} should be invalid");
    }
}

#[test]
fn rejects_unsupported_lengths_and_empty_input() {
    assert!(!is_valid_document(""));
    assert!(!is_valid_document("123"));
    assert!(!is_valid_document("951810400041"));
    assert!(!is_valid_document("not a number"));

    let missing = validate_document(None, DocumentPolicy::default());
    assert!(!missing.valid);
    assert_eq!(missing.kind, None);
    assert_eq!(missing.into_valid(), None);
}

#[test]
fn repeated_digit_documents_follow_policy() {
    let strict = DocumentPolicy::default();
    let lenient = DocumentPolicy {
        reject_repeated_digits: false,
    };

    for raw in ["00000000000", "11111111111", "00000000000000"] {
        assert!(!validate_document(Some(raw), strict).valid, "{raw} strict");
        assert!(validate_document(Some(raw), lenient).valid, "{raw} lenient");
    }
}
