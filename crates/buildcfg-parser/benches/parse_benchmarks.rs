use buildcfg_parser::{ParseOptions, parse_str, parse_with, scan_header};
use criterion::{Criterion, black_box, criterion_group, criterion_main};

fn sample_config(sections: usize) -> String {
    let mut text = String::new();
    for i in 0..sections {
        text.push_str(&format!("[part{i}: {i} % 2 == 0 or True] # generated\n"));
        text.push_str("recipe = zc.recipe.egg\n");
        text.push_str(&format!("=> part{} base\n", i + 1));
        text.push_str("eggs =\n    alpha\n    beta\n\n      gamma\n");
        text.push_str("# zero-indent comment\n\n");
    }
    text
}

fn parse_benchmark(c: &mut Criterion) {
    let text = sample_config(200);

    c.bench_function("parse_str (200 sections)", |b| {
        b.iter(|| {
            let doc = parse_str(black_box(&text), "bench").unwrap();
            assert_eq!(doc.len(), 200);
        })
    });

    let options = ParseOptions::new()
        .label("bench")
        .evaluator(|_: &str, _: &buildcfg_parser::Bindings| Ok::<_, std::io::Error>(true));
    c.bench_function("parse_with constant evaluator (200 sections)", |b| {
        b.iter(|| {
            let _ = parse_with(black_box(text.as_bytes()), &options).unwrap();
        })
    });
}

fn scan_header_benchmark(c: &mut Criterion) {
    let line = r"[g:2 in map(lambda i:i*2, ['''\x23\x3b)'''] + list('\x23[]][\x3b\x23'))] # comment ][";
    c.bench_function("scan_header (nested expression)", |b| {
        b.iter(|| {
            let _ = scan_header(black_box(line)).unwrap();
        })
    });
}

criterion_group!(benches, parse_benchmark, scan_header_benchmark);
criterion_main!(benches);
