//! CLI 进度条实现
//!
//! 基于 indicatif，绘制到 stderr，stdout 只输出原始数据

use blkdump_lib::progress::{
    ProgressCallback, ProgressCallbackArc, ProgressId, ProgressInfo, no_op_progress_callback,
};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::collections::HashMap;
use std::io::{self, IsTerminal};
use std::sync::{Arc, Mutex};

/// 基于 indicatif 的进度回调实现
pub struct IndicatifProgressCallback {
    progress_bars: Arc<Mutex<HashMap<u64, ProgressBar>>>,
    next_id: Arc<Mutex<u64>>,
}

impl IndicatifProgressCallback {
    pub fn new() -> Self {
        Self {
            progress_bars: Arc::new(Mutex::new(HashMap::new())),
            next_id: Arc::new(Mutex::new(1)),
        }
    }

    /// 获取下一个唯一的进度条 ID
    fn next_id(&self) -> u64 {
        let mut id = self.next_id.lock().unwrap();
        let current = *id;
        *id += 1;
        current
    }
}

impl Default for IndicatifProgressCallback {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressCallback for IndicatifProgressCallback {
    fn start(&self, info: ProgressInfo) -> ProgressId {
        let id = self.next_id();

        let bar = ProgressBar::with_draw_target(Some(info.total), ProgressDrawTarget::stderr());
        bar.set_style(
            ProgressStyle::with_template("{msg} {wide_bar} {bytes}/{total_bytes} {bytes_per_sec}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=>-"),
        );
        bar.set_message(info.message);

        self.progress_bars.lock().unwrap().insert(id, bar);
        ProgressId(id)
    }

    fn increment(&self, id: ProgressId, delta: u64) {
        if let Ok(bars) = self.progress_bars.lock()
            && let Some(bar) = bars.get(&id.0)
        {
            bar.inc(delta);
        }
    }

    fn finish(&self, id: ProgressId, final_message: String) {
        if let Ok(mut bars) = self.progress_bars.lock()
            && let Some(bar) = bars.remove(&id.0)
        {
            bar.finish_with_message(final_message);
        }
    }
}

/// 仅在 stderr 为终端且未指定 --quiet 时显示进度条
pub fn create_progress_callback(quiet: bool) -> ProgressCallbackArc {
    if quiet || !io::stderr().is_terminal() {
        no_op_progress_callback()
    } else {
        Arc::new(IndicatifProgressCallback::new())
    }
}
