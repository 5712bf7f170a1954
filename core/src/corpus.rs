use crate::Document;

const DEMO: &[(&str, &str, &str)] = &[
    ("doc1", "Rust编程入门", "Rust是一种注重安全与性能的系统编程语言，所有权模型在编译期消除数据竞争。"),
    ("doc2", "Tokio异步运行时", "Tokio为Rust提供异步运行时，包括任务调度、网络套接字和定时器。"),
    ("doc3", "搜索引擎原理", "搜索引擎的核心是倒排索引，查询时合并词项的文档列表并按TF-IDF排序。"),
    ("doc4", "网络编程基础", "网络编程涉及套接字、协议解析与连接管理，HTTP服务是常见的应用。"),
    ("doc5", "多线程编程", "多线程编程通过读写锁保护共享状态，可以提高程序的并发性能。"),
];

/// Fixed documents indexed when the source directory yields nothing.
pub fn demo_corpus() -> Vec<Document> {
    DEMO.iter()
        .map(|(id, title, content)| Document::new(*id, *title, *content, format!("demo/{id}")))
        .collect()
}
