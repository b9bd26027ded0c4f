use std::{future::Future, time::Duration};

use tokio::{
    sync::mpsc,
    time::{self, Instant},
};

/// 防抖器
///
/// 每次 [`Debouncer::submit`] 都会重置计时器；只有在 `delay` 时间内没有新的提交时，
/// 回调才会以最后一次提交的参数执行一次。
///
/// 回调在独立的任务中执行，不会阻塞之后的提交。丢弃防抖器后，已经在等待中的调用仍会执行。
///
/// - Panics
///
/// 必须在 tokio 运行时中创建。
pub struct Debouncer<T> {
    delay: Duration,
    tx: mpsc::UnboundedSender<T>,
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new<F, Fut>(delay: Duration, f: F) -> Self
    where
        F: Fn(T) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(run(rx, delay, f));
        Self { delay, tx }
    }

    /// 提交一次调用，取消之前尚未执行的调用
    pub fn submit(&self, args: T) {
        if self.tx.send(args).is_err() {
            tracing::warn!("debounce task stopped, call dropped");
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

async fn run<T, F, Fut>(mut rx: mpsc::UnboundedReceiver<T>, delay: Duration, f: F)
where
    T: Send + 'static,
    F: Fn(T) -> Fut,
    Fut: Future<Output = ()> + Send + 'static,
{
    while let Some(mut latest) = rx.recv().await {
        let sleep = time::sleep(delay);
        tokio::pin!(sleep);

        loop {
            tokio::select! {
                _ = &mut sleep => break,
                next = rx.recv() => match next {
                    Some(args) => {
                        latest = args;
                        sleep.as_mut().reset(Instant::now() + delay);
                    }
                    None => {
                        (&mut sleep).await;
                        break;
                    }
                },
            }
        }

        tokio::spawn(f(latest));
    }
}
