use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use radius_proto::auth::{decrypt_user_password, encrypt_user_password, generate_request_authenticator};
use radius_proto::{Attribute, Code, Codec, MemoryDictionary, Packet};

const SECRET: &[u8] = b"testing123";

fn codec() -> Codec {
    Codec::new(MemoryDictionary::standard().into_shared()).with_user_password_hook()
}

fn create_test_packet(codec: &Codec, num_attributes: usize) -> Packet {
    let mut packet = codec.new_packet(Code::AccessRequest, 1);
    packet
        .add_attribute_str("User-Name", "testuser")
        .expect("Failed to create User-Name attribute");
    packet
        .add_attribute_str("User-Password", "testpassword")
        .expect("Failed to create User-Password attribute");

    // Add additional attributes to test scaling
    for i in 0..num_attributes {
        packet
            .add_attribute_str("Reply-Message", &format!("attribute_{}", i))
            .expect("Failed to create Reply-Message attribute");
    }

    // Vendor-Specific container with one sub-attribute
    let vsa = Attribute::string(1, "shell:priv-lvl=15")
        .and_then(|a| a.for_vendor(9))
        .expect("Failed to create vendor attribute");
    packet.add_attribute(vsa).expect("Failed to add vendor attribute");

    packet
}

fn bench_packet_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("packet_encode");
    let codec = codec();

    for num_attrs in [0, 5, 10, 20].iter() {
        group.bench_with_input(
            BenchmarkId::from_parameter(num_attrs),
            num_attrs,
            |b, &num_attrs| {
                let mut packet = create_test_packet(&codec, num_attrs);
                b.iter(|| packet.encode_request(black_box(SECRET)).expect("Failed to encode packet"));
            },
        );
    }

    group.finish();
}

fn bench_packet_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("packet_decode");
    let codec = codec();

    for num_attrs in [0, 5, 10, 20].iter() {
        group.bench_with_input(
            BenchmarkId::from_parameter(num_attrs),
            num_attrs,
            |b, &num_attrs| {
                let mut packet = create_test_packet(&codec, num_attrs);
                let encoded = packet.encode_request(SECRET).expect("Failed to encode");
                b.iter(|| {
                    codec
                        .decode_request(black_box(&encoded), SECRET, None)
                        .expect("Failed to decode packet")
                });
            },
        );
    }

    group.finish();
}

fn bench_response_round_trip(c: &mut Criterion) {
    let codec = codec();
    let mut request = create_test_packet(&codec, 5);
    request.encode_request(SECRET).expect("Failed to encode request");

    c.bench_function("response_round_trip", |b| {
        b.iter(|| {
            let mut response = Packet::response_to(&request, Code::AccessAccept);
            let bytes = response
                .encode_response(SECRET, &request)
                .expect("Failed to encode response");
            codec
                .decode_response(black_box(&bytes), SECRET, &request)
                .expect("Failed to decode response")
        });
    });
}

fn bench_password_hiding(c: &mut Criterion) {
    let mut group = c.benchmark_group("password_hiding");

    let passwords = vec![
        ("short", "test"),
        ("medium", "testpassword123"),
        ("long", "this_is_a_very_long_password_to_test_performance"),
    ];

    for (name, password) in passwords.iter() {
        group.bench_with_input(BenchmarkId::from_parameter(name), password, |b, &password| {
            let req_auth = generate_request_authenticator(SECRET);
            let encrypted = encrypt_user_password(password.as_bytes(), SECRET, &req_auth)
                .expect("Failed to hide password");
            b.iter(|| {
                decrypt_user_password(black_box(&encrypted), black_box(SECRET), black_box(&req_auth))
                    .expect("Failed to recover password")
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_packet_encode,
    bench_packet_decode,
    bench_response_round_trip,
    bench_password_hiding
);
criterion_main!(benches);
