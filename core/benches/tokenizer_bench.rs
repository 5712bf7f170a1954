use criterion::{criterion_group, criterion_main, Criterion};
use search_core::tokenizer::TextPipeline;

const SAMPLE: &str = "<html><body><h1>搜索引擎原理</h1>\
<p>An inverted index maps every term to the documents containing it. \
搜索引擎的核心是倒排索引，查询时合并词项的文档列表并按TF-IDF排序。 \
Ranking sums tf * idf over the query terms.</p></body></html>";

fn bench_analyze(c: &mut Criterion) {
    let pipeline = TextPipeline::new();
    let text = SAMPLE.repeat(50);
    c.bench_function("analyze_mixed_script", |b| b.iter(|| pipeline.analyze(&text)));
}

criterion_group!(benches, bench_analyze);
criterion_main!(benches);
