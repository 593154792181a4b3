//! Benchmarks for the frame hot paths: address resolution, request encoding
//! and response validation. No I/O.

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use fx_link::numeric::{pack_bits, unpack_bits};
use fx_link::{checksum, encode_hex, resolve, ReadCommand, ReadResponse, RegisterKind, WriteCommand, ETX, STX};

fn read_response(data: &[u8]) -> Vec<u8> {
    let mut frame = vec![STX];
    encode_hex(data, &mut frame);
    frame.push(ETX);
    let digits = checksum(&frame[1..]);
    frame.extend_from_slice(&digits);
    frame
}

fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve");
    group.bench_function("data_words", |b| {
        b.iter(|| resolve(black_box(RegisterKind::Data), black_box(20), black_box(32)))
    });
    group.bench_function("octal_outputs", |b| {
        b.iter(|| resolve(black_box(RegisterKind::OutputContact), black_box(170), black_box(8)))
    });
    group.finish();
}

fn bench_encode(c: &mut Criterion) {
    let payload: Vec<u8> = (0..64u8).collect();
    let mut group = c.benchmark_group("encode");

    group.bench_function("read_command", |b| {
        let command = ReadCommand::new(0x1028, 64).unwrap();
        let mut out = Vec::with_capacity(16);
        b.iter(|| {
            out.clear();
            black_box(&command).encode_into(&mut out);
        })
    });

    group.throughput(Throughput::Bytes(payload.len() as u64));
    group.bench_function("write_command_64", |b| {
        let command = WriteCommand::new(0x1000, &payload).unwrap();
        let mut out = Vec::with_capacity(140);
        b.iter(|| {
            out.clear();
            black_box(&command).encode_into(&mut out);
        })
    });
    group.finish();
}

fn bench_validate(c: &mut Criterion) {
    let data: Vec<u8> = (0..64u8).map(|i| i.wrapping_mul(37)).collect();
    let frame = read_response(&data);

    let mut group = c.benchmark_group("validate");
    group.throughput(Throughput::Bytes(data.len() as u64));
    group.bench_function("read_response_64", |b| {
        b.iter(|| ReadResponse::from_bytes(black_box(&frame), data.len()).unwrap())
    });
    group.finish();
}

fn bench_bits(c: &mut Criterion) {
    let bits: Vec<bool> = (0..512).map(|i| i % 3 == 0).collect();
    let packed = pack_bits(&bits);

    let mut group = c.benchmark_group("bits");
    group.bench_function("pack_512", |b| b.iter(|| pack_bits(black_box(&bits))));
    group.bench_function("unpack_512", |b| {
        b.iter(|| unpack_bits(black_box(&packed), 3, 500))
    });
    group.finish();
}

criterion_group!(benches, bench_resolve, bench_encode, bench_validate, bench_bits);
criterion_main!(benches);
