use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ddsplus_bcn::{
    BcFormat, BlockCompressor, BlockSettings, CompressionSpeed, ErrorMetric, NativeBlockCodec,
};
use ddsplus_common::allocate::allocate_align_64_zeroed;
use ddsplus_common::block_4x4::Block4x4;
use ddsplus_common::color_8888::Color8888;

/// Blocks in each benchmark iteration; 64K pixels.
const BLOCK_COUNT: usize = 4096;

fn test_blocks() -> Vec<Block4x4> {
    (0..BLOCK_COUNT)
        .map(|i| {
            let mut block = Block4x4::default();
            for (p, pixel) in block.pixels.iter_mut().enumerate() {
                // Smooth content with a little per-block variation, like a photo
                let base = (i * 7 + p * 3) as u8;
                *pixel = Color8888::new(base, base.wrapping_add(40), base / 2, 255 - (p as u8));
            }
            block
        })
        .collect()
}

fn criterion_benchmark(c: &mut Criterion) {
    let blocks = test_blocks();
    let codec = NativeBlockCodec;

    for speed in CompressionSpeed::all_values() {
        let mut group = c.benchmark_group(format!("Compress Blocks ({speed:?})"));
        group.throughput(Throughput::Elements((BLOCK_COUNT * 16) as u64));
        let settings = BlockSettings::new(ErrorMetric::Perceptual, *speed);

        for &format in BcFormat::all_values() {
            let block_size = format.bytes_per_block();
            let mut output = allocate_align_64_zeroed(BLOCK_COUNT * block_size).unwrap();

            group.bench_with_input(
                BenchmarkId::from_parameter(format!("{format:?}")),
                &format,
                |b, &format| {
                    b.iter(|| {
                        for (block, chunk) in blocks
                            .iter()
                            .zip(output.as_mut_slice().chunks_exact_mut(block_size))
                        {
                            codec.compress_block(block, format, settings, chunk);
                        }
                    })
                },
            );
        }

        group.finish();
    }
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
