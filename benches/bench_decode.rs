use bitpack_decoder::{BitpackDecoder, Decoder, decode_le_i32, mask_for_bits, unpack};
use bytes::Bytes;
use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use parquet::util::bit_util::{BitReader, BitWriter};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::hint::black_box;

const BATCH_SIZE: usize = 4096;

fn create_random_bitpacked_data(rng: &mut StdRng, bitwidth: usize) -> Vec<u8> {
    let mut bw = BitWriter::new((BATCH_SIZE * bitwidth).div_ceil(8));
    (0..BATCH_SIZE).for_each(|_| {
        bw.put_value(rng.gen_range(0..=u64::from(mask_for_bits(bitwidth))), bitwidth)
    });
    bw.consume()
}

fn decode_arrow(input: Bytes, bitwidth: usize, output: &mut [u32]) -> usize {
    BitReader::new(input).get_batch::<u32>(output, bitwidth)
}

pub fn bench_decode(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(34563456);

    {
        let mut group = c.benchmark_group("decode_bitpacked");
        group.throughput(Throughput::Elements(BATCH_SIZE as u64));

        for bitwidth in 1..=32 {
            let bitpacked = Bytes::from(create_random_bitpacked_data(&mut rng, bitwidth));
            let mut output = Vec::with_capacity(BATCH_SIZE);

            group.bench_function(format!("scalar-bitwidth-{bitwidth}"), |b| {
                b.iter(|| {
                    BitpackDecoder
                        .decode(
                            &bitpacked,
                            bitwidth,
                            &mut output.spare_capacity_mut()[..BATCH_SIZE],
                        )
                        .unwrap()
                })
            });

            output.resize(BATCH_SIZE, 0);

            group.bench_function(format!("unpack-bitwidth-{bitwidth}"), |b| {
                b.iter(|| {
                    unpack(
                        &bitpacked,
                        mask_for_bits(bitwidth),
                        &mut output,
                        BATCH_SIZE,
                        bitwidth,
                    )
                    .unwrap()
                })
            });
            group.bench_function(format!("arrow-bitwidth-{bitwidth}"), |b| {
                b.iter(|| decode_arrow(bitpacked.clone(), bitwidth, &mut output))
            });
        }
    }

    {
        let mut group = c.benchmark_group("decode_le_i32");
        let input = (0..BATCH_SIZE * 4)
            .map(|_| rng.gen_range(0..=255u8))
            .collect::<Vec<u8>>();
        group.throughput(Throughput::Elements(BATCH_SIZE as u64));

        group.bench_function("prefixes", |b| {
            b.iter(|| {
                input
                    .chunks_exact(4)
                    .map(|chunk| decode_le_i32(black_box(chunk)).unwrap())
                    .sum::<i64>()
            })
        });
    }
}

criterion_group!(benches, bench_decode);
criterion_main!(benches);
