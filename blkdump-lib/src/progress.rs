//! 进度回调系统
//!
//! 库本身不依赖任何终端输出，调用方通过实现 [`ProgressCallback`]
//! 决定如何展示解码进度。

use std::sync::Arc;

/// 进度条状态
#[derive(Debug, Clone)]
pub struct ProgressInfo {
    /// 当前消息
    pub message: String,
    /// 总量（字节）
    pub total: u64,
}

/// 进度条 ID 类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProgressId(pub u64);

/// 进度回调 trait
pub trait ProgressCallback: Send + Sync {
    /// 开始一个新的进度条，返回其 ID
    fn start(&self, info: ProgressInfo) -> ProgressId;

    /// 增加进度
    fn increment(&self, id: ProgressId, delta: u64);

    /// 完成进度条
    fn finish(&self, id: ProgressId, final_message: String);
}

/// 不产生任何输出的进度回调
#[derive(Debug, Default)]
pub struct NoOpProgressCallback;

impl ProgressCallback for NoOpProgressCallback {
    fn start(&self, _info: ProgressInfo) -> ProgressId {
        ProgressId(0)
    }

    fn increment(&self, _id: ProgressId, _delta: u64) {}

    fn finish(&self, _id: ProgressId, _final_message: String) {}
}

pub type ProgressCallbackArc = Arc<dyn ProgressCallback>;

pub fn no_op_progress_callback() -> ProgressCallbackArc {
    Arc::new(NoOpProgressCallback)
}

/// 单个进度条的句柄
pub struct ProgressHandler<'a> {
    callback: &'a dyn ProgressCallback,
    id: ProgressId,
}

impl<'a> ProgressHandler<'a> {
    pub fn bar(callback: &'a dyn ProgressCallback, total: u64, message: impl Into<String>) -> Self {
        let id = callback.start(ProgressInfo {
            message: message.into(),
            total,
        });
        Self { callback, id }
    }

    pub fn inc(&self, delta: u64) {
        self.callback.increment(self.id, delta);
    }

    pub fn finish_with_message(self, message: impl Into<String>) {
        self.callback.finish(self.id, message.into());
    }
}
