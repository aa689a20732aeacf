//! 数据集读取模块
//!
//! 把磁盘上的衰变树转换为计算核心使用的不可变事件表。

pub mod reader;

pub use reader::{
    DatasetFormat, LoadedDataset, RawEvent, SkippedEvent, load_dataset, read_json_array,
    read_json_lines,
};
