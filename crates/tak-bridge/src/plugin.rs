// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Plugin lifecycle adapter: attach to a messenger, detach once.

use std::sync::Arc;

use tak_core::{BridgeConfig, CHANNEL_NAME};

use crate::bridge::EnvironmentBridge;
use crate::channel::{BinaryMessenger, MethodChannel};
use crate::traits::PlatformBridge;

/// What the host hands a plugin when attaching it.
#[derive(Clone)]
pub struct PluginBinding {
    /// Transport the plugin's channel is created on.
    pub messenger: Arc<dyn BinaryMessenger>,
    /// Application context, wrapped in the bridge that knows how to use it.
    pub context: Arc<dyn PlatformBridge>,
}

/// An attached plugin.
///
/// `detach` consumes the value, so a plugin instance is detached at most
/// once.
pub struct TakPlugin {
    channel: MethodChannel,
    bridge: Arc<EnvironmentBridge>,
}

impl TakPlugin {
    /// Create the channel on the binding's messenger and start handling calls.
    pub fn attach(binding: &PluginBinding, config: BridgeConfig) -> Self {
        let channel = MethodChannel::new(binding.messenger.clone(), CHANNEL_NAME);
        let bridge = Arc::new(EnvironmentBridge::new(binding.context.clone(), config));
        channel.set_method_call_handler(Some(bridge.clone()));

        tracing::info!(
            channel = channel.name(),
            platform = binding.context.platform_name(),
            "tak plugin attached"
        );
        Self { channel, bridge }
    }

    pub fn channel(&self) -> &MethodChannel {
        &self.channel
    }

    pub fn bridge(&self) -> &EnvironmentBridge {
        &self.bridge
    }

    /// Clear the channel handler; no further calls reach the bridge.
    pub fn detach(self) {
        self.channel.set_method_call_handler(None);
        tracing::info!(channel = self.channel.name(), "tak plugin detached");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::Ordering;

    use tak_core::{MethodCall, NativeStatus};

    use crate::bridge::tests::FakePlatform;
    use crate::channel::LocalMessenger;

    fn attached() -> (Arc<LocalMessenger>, Arc<FakePlatform>, TakPlugin) {
        let messenger = Arc::new(LocalMessenger::new());
        let platform = Arc::new(FakePlatform::new(
            NativeStatus::SUCCESS,
            "/var/mobile/Containers/Data/Application/ABCD/Library",
        ));
        let binding = PluginBinding {
            messenger: messenger.clone(),
            context: platform.clone(),
        };
        let plugin = TakPlugin::attach(&binding, BridgeConfig::default());
        (messenger, platform, plugin)
    }

    #[test]
    fn attach_registers_tak_channel() {
        let (messenger, _, plugin) = attached();
        assert_eq!(plugin.channel().name(), "tak");
        assert!(messenger.has_handler("tak"));
    }

    #[test]
    fn load_environment_over_the_channel() {
        let (messenger, _, _plugin) = attached();
        let caller = MethodChannel::new(messenger, "tak");
        let result = caller.invoke_method(&MethodCall::new("loadEnvironment")).unwrap();
        assert_eq!(
            result.as_str(),
            Some("/var/mobile/Containers/Data/Application/ABCD/Library")
        );
    }

    #[test]
    fn unknown_method_over_the_channel() {
        let (messenger, _, _plugin) = attached();
        let caller = MethodChannel::new(messenger, "tak");
        let result = caller.invoke_method(&MethodCall::new("getBuildVersion")).unwrap();
        assert!(result.is_not_implemented());
    }

    #[test]
    fn detach_stops_dispatch() {
        let (messenger, platform, plugin) = attached();
        let caller = MethodChannel::new(messenger.clone(), "tak");

        plugin.detach();

        assert!(!messenger.has_handler("tak"));
        let result = caller.invoke_method(&MethodCall::new("loadEnvironment")).unwrap();
        assert!(result.is_not_implemented());
        assert_eq!(platform.loads.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn channel_name_is_fixed_to_tak() {
        let messenger = Arc::new(LocalMessenger::new());
        let binding = PluginBinding {
            messenger: messenger.clone(),
            context: Arc::new(FakePlatform::new(NativeStatus::SUCCESS, "/srv/tak")),
        };
        let config = BridgeConfig {
            surface_native_status: true,
            ..BridgeConfig::default()
        };
        let plugin = TakPlugin::attach(&binding, config);
        assert_eq!(plugin.channel().name(), CHANNEL_NAME);
        assert!(messenger.has_handler("tak"));
    }
}
