use super::*;
use rand::SeedableRng;
use rand_xorshift::XorShiftRng;

// Parameter generation is a bounded randomized search, so the tests walk
// a few fixed seeds; the first one that stays within the attempt caps is
// used. Everything downstream is deterministic in that seed.
fn setup_for(level: SecurityLevel) -> (PublicParameters, MasterSecret, XorShiftRng) {
    for seed in 0..16u64 {
        let mut rng = XorShiftRng::seed_from_u64(seed);
        if let Ok((public, master)) = setup(level, &mut rng) {
            return (public, master, rng);
        }
    }
    panic!("no seed produced parameters for {:?}", level);
}

#[test]
fn round_trip_at_lowest_level() {
    let (public, master, mut rng) = setup_for(SecurityLevel::Lowest);
    let key = extract(b"alice@example.com", &public, &master).unwrap();
    let ciphertext = encrypt(b"hello world", b"alice@example.com", &public, &mut rng).unwrap();
    assert_eq!(
        decrypt(&ciphertext, &key, &public).unwrap(),
        b"hello world".to_vec()
    );
}

#[test]
fn round_trip_at_low_level() {
    let (public, master, mut rng) = setup_for(SecurityLevel::Low);
    let key = extract(b"alice@example.com", &public, &master).unwrap();
    let ciphertext = encrypt(b"hello world", b"alice@example.com", &public, &mut rng).unwrap();
    assert_eq!(
        decrypt(&ciphertext, &key, &public).unwrap(),
        b"hello world".to_vec()
    );
}

#[test]
fn round_trip_across_message_sizes() {
    let (public, master, mut rng) = setup_for(SecurityLevel::Lowest);
    let key = extract(b"id", &public, &master).unwrap();
    for len in [1usize, 19, 64, 1024].iter() {
        let message: Vec<u8> = (0..*len).map(|i| (i * 31 % 256) as u8).collect();
        let ciphertext = encrypt(&message, b"id", &public, &mut rng).unwrap();
        assert_eq!(ciphertext.w.len(), message.len());
        assert_eq!(ciphertext.v.len(), public.hash.output_len());
        assert_eq!(decrypt(&ciphertext, &key, &public).unwrap(), message);
    }
}

#[test]
fn wrong_identity_is_rejected() {
    let (public, master, mut rng) = setup_for(SecurityLevel::Lowest);
    let key_b = extract(b"b", &public, &master).unwrap();
    let ciphertext = encrypt(b"for a only", b"a", &public, &mut rng).unwrap();
    assert_eq!(
        decrypt(&ciphertext, &key_b, &public),
        Err(Error::DecryptionFailed)
    );
}

#[test]
fn tampering_is_rejected() {
    let (public, master, mut rng) = setup_for(SecurityLevel::Lowest);
    let key = extract(b"alice", &public, &master).unwrap();
    let ciphertext = encrypt(b"payload bytes", b"alice", &public, &mut rng).unwrap();

    for (field, index, bit) in [
        ("v", 0usize, 0u8),
        ("v", 7, 5),
        ("v", 19, 7),
        ("w", 0, 1),
        ("w", 12, 6),
    ]
    .iter()
    {
        let mut mutated = ciphertext.clone();
        match *field {
            "v" => mutated.v[*index] ^= 1u8 << *bit,
            _ => mutated.w[*index] ^= 1u8 << *bit,
        }
        assert_eq!(
            decrypt(&mutated, &key, &public),
            Err(Error::DecryptionFailed),
            "flip in {}[{}] bit {}",
            field,
            index,
            bit
        );
    }
}

#[test]
fn malformed_ciphertext_is_rejected_early() {
    let (public, master, mut rng) = setup_for(SecurityLevel::Lowest);
    let key = extract(b"alice", &public, &master).unwrap();
    let mut ciphertext = encrypt(b"payload", b"alice", &public, &mut rng).unwrap();
    ciphertext.v.pop();
    assert_eq!(
        decrypt(&ciphertext, &key, &public),
        Err(Error::MalformedCipherText)
    );
}

#[test]
fn empty_inputs_are_rejected() {
    let (public, master, mut rng) = setup_for(SecurityLevel::Lowest);
    assert_eq!(
        extract(b"", &public, &master),
        Err(Error::EmptyIdentity)
    );
    assert_eq!(
        encrypt(b"", b"id", &public, &mut rng),
        Err(Error::EmptyMessage)
    );
    assert_eq!(
        encrypt(b"m", b"", &public, &mut rng),
        Err(Error::EmptyIdentity)
    );
}

#[test]
fn corrupted_parameters_are_rejected() {
    let (public, master, _) = setup_for(SecurityLevel::Lowest);
    public.validate().unwrap();
    let mut corrupted = public.clone();
    corrupted.point_pub.x += 1u32;
    assert_eq!(corrupted.validate(), Err(Error::InvalidPublicParameters));
    assert_eq!(
        extract(b"id", &corrupted, &master),
        Err(Error::InvalidPublicParameters)
    );
}

#[test]
fn setup_is_deterministic_per_seed() {
    let mut rng_a = XorShiftRng::seed_from_u64(1234);
    let mut rng_b = XorShiftRng::seed_from_u64(1234);
    let a = setup(SecurityLevel::Lowest, &mut rng_a);
    let b = setup(SecurityLevel::Lowest, &mut rng_b);
    match (a, b) {
        (Ok((pa, ma)), Ok((pb, mb))) => {
            assert_eq!(pa, pb);
            assert_eq!(ma, mb);
        }
        (Err(ea), Err(eb)) => assert_eq!(ea, eb),
        _ => panic!("seeded setup diverged"),
    }
}

#[test]
fn artifacts_round_trip_through_the_wire_format() {
    let (public, master, mut rng) = setup_for(SecurityLevel::Lowest);
    let key = extract(b"alice", &public, &master).unwrap();
    let ciphertext = encrypt(b"wire", b"alice", &public, &mut rng).unwrap();

    let mut buffer = Vec::new();
    public.write(&mut buffer).unwrap();
    let public_back = PublicParameters::read(&buffer[..]).unwrap();
    assert_eq!(public_back, public);

    let mut buffer = Vec::new();
    master.write(&mut buffer).unwrap();
    assert_eq!(MasterSecret::read(&buffer[..]).unwrap(), master);

    let mut buffer = Vec::new();
    key.write(&mut buffer).unwrap();
    let key_back = PrivateKey::read(&buffer[..]).unwrap();
    assert_eq!(key_back, key);

    let mut buffer = Vec::new();
    ciphertext.write(&mut buffer).unwrap();
    let ciphertext_back = CipherText::read(&buffer[..]).unwrap();
    assert_eq!(ciphertext_back, ciphertext);

    // decryption still works with the re-read artifacts
    assert_eq!(
        decrypt(&ciphertext_back, &key_back, &public_back).unwrap(),
        b"wire".to_vec()
    );
}
