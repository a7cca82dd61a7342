//! Benchmarks for TechnoTeam and ascii decoding.
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use ttimage_core::{ascii, PixelEncoding, TtImageDecoder};

const LINES: usize = 1024;
const COLUMNS: usize = 1360;

fn synthetic_container(encoding: PixelEncoding) -> Vec<u8> {
    let mut raw = format!(
        "Typ={}\r\n|Lines={}\r\n|Columns={}\r\n\r\n",
        encoding.tag(),
        LINES,
        COLUMNS
    )
    .into_bytes();
    raw.push(0);

    let elements = LINES * COLUMNS * encoding.channels();
    match encoding {
        PixelEncoding::CameraU16 => {
            for i in 0..elements {
                raw.extend_from_slice(&((i & 0xFFFF) as u16).to_le_bytes());
            }
        }
        PixelEncoding::LuminanceF32 | PixelEncoding::ColorRgbF32 => {
            for i in 0..elements {
                raw.extend_from_slice(&(i as f32 * 0.5).to_le_bytes());
            }
        }
    }
    raw
}

fn decode_container_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_container");

    for encoding in [
        PixelEncoding::CameraU16,
        PixelEncoding::LuminanceF32,
        PixelEncoding::ColorRgbF32,
    ] {
        let raw = synthetic_container(encoding);
        group.throughput(Throughput::Bytes(raw.len() as u64));

        group.bench_function(format!("{:?}", encoding), |b| {
            b.iter(|| {
                let mut decoder = TtImageDecoder::new();
                let result = decoder.decode_bytes(black_box(&raw)).unwrap();
                black_box(result.pixels.shape())
            })
        });
    }

    group.finish();
}

fn decode_ascii_benchmark(c: &mut Criterion) {
    let mut text = String::from("Luminance image\nunit: cd/m^2\n");
    for line in 0..256 {
        let row: Vec<String> = (0..256)
            .map(|col| format!("{},{}", line, col % 10))
            .collect();
        text.push_str(&row.join("\t"));
        text.push('\n');
    }

    let mut group = c.benchmark_group("decode_ascii");
    group.throughput(Throughput::Bytes(text.len() as u64));

    group.bench_function("grid_256x256", |b| {
        b.iter(|| {
            let array = ascii::decode(black_box(&text)).unwrap();
            black_box(array.shape())
        })
    });

    group.finish();
}

criterion_group!(benches, decode_container_benchmark, decode_ascii_benchmark);
criterion_main!(benches);
