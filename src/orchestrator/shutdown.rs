//! 中断信号
//!
//! 基于 `tokio::sync::watch`，由 Ctrl+C 触发，调度器在提交任务和等待时检查

use std::time::Duration;

use tokio::sync::watch;

/// 触发端，由 main 持有
#[derive(Debug)]
pub struct ShutdownTrigger {
    tx: watch::Sender<bool>,
}

impl ShutdownTrigger {
    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }
}

/// 监听端，可任意 clone
#[derive(Debug, Clone)]
pub struct ShutdownSignal {
    rx: watch::Receiver<bool>,
}

/// 创建一对中断信号
pub fn shutdown_channel() -> (ShutdownTrigger, ShutdownSignal) {
    let (tx, rx) = watch::channel(false);
    (ShutdownTrigger { tx }, ShutdownSignal { rx })
}

impl ShutdownSignal {
    /// 永远不会被触发的信号
    pub fn never() -> Self {
        shutdown_channel().1
    }

    pub fn is_triggered(&self) -> bool {
        *self.rx.borrow()
    }

    /// 等待信号被触发；触发端被丢弃时永远挂起
    pub async fn triggered(&self) {
        let mut rx = self.rx.clone();
        let closed = rx.wait_for(|stop| *stop).await.is_err();
        if closed {
            std::future::pending::<()>().await;
        }
    }

    /// 休眠指定时长，被中断时提前返回 `false`
    pub async fn sleep(&self, duration: Duration) -> bool {
        if duration.is_zero() {
            return !self.is_triggered();
        }
        tokio::select! {
            _ = tokio::time::sleep(duration) => true,
            _ = self.triggered() => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_sleep_completes_without_trigger() {
        let signal = ShutdownSignal::never();
        assert!(signal.sleep(Duration::from_secs(3)).await);
        assert!(!signal.is_triggered());
    }

    #[tokio::test(start_paused = true)]
    async fn test_trigger_interrupts_sleep() {
        let (trigger, signal) = shutdown_channel();

        let waiter = {
            let signal = signal.clone();
            tokio::spawn(async move { signal.sleep(Duration::from_secs(60)).await })
        };

        tokio::time::sleep(Duration::from_secs(1)).await;
        trigger.trigger();

        assert!(!waiter.await.unwrap());
        assert!(signal.is_triggered());
    }
}
