use std::sync::Arc;

use anyhow::Result;
use arboard::Clipboard;
use global_hotkey::{GlobalHotKeyEvent, HotKeyState};
use hushkey::event::HushEvent;
use hushkey::hotkey::HotkeyBinder;
use hushkey::icon::IconExt;
use hushkey::lang::labels;
use hushkey::notify::NotificationLayer;
use hushkey::{
    APP_NAME_PRETTY, Config, ConfigManager, DEFAULT_LOG_LEVEL, DeviceMonitor, EndpointBinding,
    EndpointHost, KeyEdge, Language, MicState, MuteToggle, ToggleMode, VERSION,
};
use parking_lot::RwLock;
use tao::event::{Event, StartCause};
use tao::event_loop::{ControlFlow, EventLoop, EventLoopBuilder};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tray_icon::menu::{
    AboutMetadataBuilder, CheckMenuItem, Menu, MenuEvent, MenuItem, PredefinedMenuItem, Submenu,
};
use tray_icon::{TrayIconBuilder, TrayIconEvent};

fn main() -> Result<()> {
    // Initialize the logger
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("HUSHKEY_LOG")
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL)),
        )
        .finish()
        .with(NotificationLayer::new())
        .init();

    // Load config
    let config_manager = ConfigManager::new()?;
    let config = Arc::new(RwLock::new(config_manager.load()?));
    // save back the config to create the file if it doesn't exist
    config_manager.save(&config.read())?;

    // Bind the default capture endpoint. Not finding one yet is survivable;
    // the monitor keeps looking.
    let binding = Arc::new(EndpointBinding::new(native_host()?));
    if let Err(e) = binding.refresh_default_device() {
        warn!("No capture device bound yet: {e}");
    }

    // Set up the hotkey. A refused registration is reported, not fatal:
    // the app keeps running with no active trigger until a rebind works.
    let mut binder = HotkeyBinder::new()?;
    if let Err(e) = binder.bind(&config.read().trigger_key) {
        error!("{e}");
    }

    // Press tracking, owned by the event-loop thread
    let mut toggle = MuteToggle::new();

    let mut clipboard = Clipboard::new()?;

    // Create the tray menu
    let items = MenuItems::new(&config.read());
    let tray_menu = items.build_menu()?;

    // Set up the event loop
    let mut icon_tray = None;

    let menu_channel = MenuEvent::receiver();
    let tray_channel = TrayIconEvent::receiver();
    let hotkey_channel = GlobalHotKeyEvent::receiver();

    let event_loop: EventLoop<HushEvent> = EventLoopBuilder::with_user_event().build();
    let event_sender = event_loop.create_proxy();

    // Device monitor thread: single writer of the binding
    {
        let proxy = event_sender.clone();
        DeviceMonitor::new(binding.clone()).spawn(move |change| {
            proxy
                .send_event(HushEvent::DeviceChanged {
                    identity: change.identity,
                    name: change.name,
                })
                .ok();
        });
    }

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Wait;

        if let Event::NewEvents(StartCause::Init) = event {
            // We create the icon once the event loop is actually running
            // to prevent issues like https://github.com/tauri-apps/tray-icon/issues/90

            icon_tray.replace(
                TrayIconBuilder::new()
                    .with_menu(Box::new(tray_menu.clone()))
                    .with_tooltip(tooltip(&binding, config.read().language))
                    .with_icon(MicState::Idle.icon())
                    .build()
                    .unwrap(),
            );

            // We have to request a redraw here to have the icon actually show up.
            // Tao only exposes a redraw method on the Window so we use core-foundation directly.
            #[cfg(target_os = "macos")]
            unsafe {
                use core_foundation::runloop::{CFRunLoopGetMain, CFRunLoopWakeUp};

                let rl = CFRunLoopGetMain();
                CFRunLoopWakeUp(rl);
            }

            info!("Hushkey ready");
        }

        if let Ok(event) = menu_channel.try_recv() {
            if event.id == items.quit.id() {
                icon_tray.take();
                *control_flow = ControlFlow::Exit;
            } else if event.id == items.mode_mute.id() {
                set_mode(ToggleMode::MuteWhilePressed, &config, &config_manager, &items);
            } else if event.id == items.mode_unmute.id() {
                set_mode(ToggleMode::UnmuteWhilePressed, &config, &config_manager, &items);
            } else if event.id == items.lang_en.id() {
                set_language(Language::English, &config, &config_manager, &items);
            } else if event.id == items.lang_ko.id() {
                set_language(Language::Korean, &config, &config_manager, &items);
            } else if event.id == items.copy_config.id() {
                if let Err(e) =
                    clipboard.set_text(config_manager.config_path().to_string_lossy().into_owned())
                {
                    error!("Failed to copy config path to clipboard: {}", e);
                }
            } else if event.id == items.reload_config.id() {
                match config_manager.reload(&mut config.write()) {
                    Ok(changed) => {
                        let cfg = config.read().clone();
                        // A pending release for the old trigger can no
                        // longer be observed after rebind: restore first,
                        // then discard the pressed state.
                        if let Some(level) = toggle.reset(cfg.toggle_mode, cfg.restore_volume) {
                            apply_volume(&binding, level);
                        }
                        if let Err(e) = binder.rebind(&cfg.trigger_key) {
                            error!("{e}");
                        }
                        items.apply_config(&cfg);
                        if let Some(tray) = icon_tray.as_ref() {
                            tray.set_icon(Some(MicState::Idle.icon())).ok();
                            tray.set_tooltip(Some(tooltip(&binding, cfg.language))).ok();
                        }
                        if changed {
                            info!("Configuration reloaded");
                        }
                    }
                    Err(e) => warn!("Failed to reload config: {e}"),
                }
            }
        }

        #[expect(clippy::redundant_pattern_matching)]
        if let Ok(_) = tray_channel.try_recv() {
            // Handle tray icon events
        }

        // Handle user provided events
        if let Event::UserEvent(event) = event {
            match event {
                HushEvent::StateChanged(state) => {
                    info!(state = ?state, "State changed");
                    if let Some(tray) = icon_tray.as_ref() {
                        tray.set_icon(Some(state.icon())).ok();
                    }
                }
                HushEvent::DeviceChanged { identity, name } => {
                    info!(%identity, %name, "Default capture device changed");
                    // A press started on the old device cannot be released
                    // against it anymore: restore on the new endpoint and
                    // start from Idle.
                    let (mode, restore, language) = {
                        let cfg = config.read();
                        (cfg.toggle_mode, cfg.restore_volume, cfg.language)
                    };
                    if let Some(level) = toggle.reset(mode, restore) {
                        apply_volume(&binding, level);
                    }
                    if let Some(tray) = icon_tray.as_ref() {
                        tray.set_icon(Some(MicState::Idle.icon())).ok();
                        tray.set_tooltip(Some(tooltip(&binding, language))).ok();
                    }
                }
            };
        }

        // Handle hotkey events
        if let Ok(event) = hotkey_channel.try_recv() {
            if binder.matches(event.id()) {
                let edge = match event.state() {
                    HotKeyState::Pressed => KeyEdge::Down,
                    HotKeyState::Released => KeyEdge::Up,
                };
                // Mode and restore volume are read at the instant of the
                // transition, so settings changes apply on the next edge.
                let (mode, restore) = {
                    let cfg = config.read();
                    (cfg.toggle_mode, cfg.restore_volume)
                };
                if let Some(level) = toggle.on_edge(edge, mode, restore) {
                    apply_volume(&binding, level);
                    event_sender
                        .send_event(HushEvent::StateChanged(MicState::from_press(
                            toggle.state(),
                            mode,
                        )))
                        .ok();
                }
            }
        }
    });
}

/// Issue a volume command against whichever endpoint is bound right now.
/// Failure is logged and left alone: press tracking has already moved on
/// and the opposite edge retries on the next event.
fn apply_volume(binding: &EndpointBinding, level: f32) {
    if let Err(e) = binding.set_volume(level) {
        warn!("Volume command failed: {e}");
    }
}

fn tooltip(binding: &EndpointBinding, language: Language) -> String {
    match binding.device_name() {
        Some(name) => format!("{APP_NAME_PRETTY} - {name}"),
        None => format!("{APP_NAME_PRETTY} - {}", labels(language).no_device),
    }
}

fn set_mode(
    mode: ToggleMode,
    config: &Arc<RwLock<Config>>,
    config_manager: &ConfigManager,
    items: &MenuItems,
) {
    config.write().toggle_mode = mode;
    if let Err(e) = config_manager.save(&config.read()) {
        warn!("Failed to persist config: {e}");
    }
    items.apply_mode(mode);
    info!(?mode, "Toggle mode changed");
}

fn set_language(
    language: Language,
    config: &Arc<RwLock<Config>>,
    config_manager: &ConfigManager,
    items: &MenuItems,
) {
    config.write().language = language;
    if let Err(e) = config_manager.save(&config.read()) {
        warn!("Failed to persist config: {e}");
    }
    items.apply_language(language);
    info!(?language, "Language changed");
}

/// The tray menu items, kept around so labels and check marks can be
/// recomputed from the authoritative config values on every change.
struct MenuItems {
    mode_mute: CheckMenuItem,
    mode_unmute: CheckMenuItem,
    language_menu: Submenu,
    lang_en: CheckMenuItem,
    lang_ko: CheckMenuItem,
    copy_config: MenuItem,
    reload_config: MenuItem,
    quit: MenuItem,
}

impl MenuItems {
    fn new(config: &Config) -> Self {
        let l = labels(config.language);
        let mode = config.toggle_mode;
        Self {
            mode_mute: CheckMenuItem::new(
                l.mode_mute,
                true,
                mode == ToggleMode::MuteWhilePressed,
                None,
            ),
            mode_unmute: CheckMenuItem::new(
                l.mode_unmute,
                true,
                mode == ToggleMode::UnmuteWhilePressed,
                None,
            ),
            language_menu: Submenu::new(l.language_menu, true),
            lang_en: CheckMenuItem::new(l.english, true, config.language == Language::English, None),
            lang_ko: CheckMenuItem::new(l.korean, true, config.language == Language::Korean, None),
            copy_config: MenuItem::new(l.copy_config, true, None),
            reload_config: MenuItem::new(l.reload_config, true, None),
            quit: MenuItem::new(l.quit, true, None),
        }
    }

    fn build_menu(&self) -> Result<Menu> {
        self.language_menu
            .append_items(&[&self.lang_en, &self.lang_ko])?;

        let menu = Menu::new();
        menu.append_items(&[
            // the name of the app
            &MenuItem::new(APP_NAME_PRETTY, false, None),
            &PredefinedMenuItem::separator(),
            &PredefinedMenuItem::about(
                None,
                Some(
                    AboutMetadataBuilder::new()
                        .name(Some(APP_NAME_PRETTY.to_owned()))
                        .version(Some(VERSION.to_owned()))
                        .build(),
                ),
            ),
            &self.mode_mute,
            &self.mode_unmute,
            &self.language_menu,
            &PredefinedMenuItem::separator(),
            &self.copy_config,
            &self.reload_config,
            &PredefinedMenuItem::separator(),
            &self.quit,
        ])?;
        Ok(menu)
    }

    fn apply_mode(&self, mode: ToggleMode) {
        self.mode_mute
            .set_checked(mode == ToggleMode::MuteWhilePressed);
        self.mode_unmute
            .set_checked(mode == ToggleMode::UnmuteWhilePressed);
    }

    fn apply_language(&self, language: Language) {
        let l = labels(language);
        self.mode_mute.set_text(l.mode_mute);
        self.mode_unmute.set_text(l.mode_unmute);
        self.language_menu.set_text(l.language_menu);
        self.lang_en.set_text(l.english);
        self.lang_ko.set_text(l.korean);
        self.copy_config.set_text(l.copy_config);
        self.reload_config.set_text(l.reload_config);
        self.quit.set_text(l.quit);
        self.lang_en.set_checked(language == Language::English);
        self.lang_ko.set_checked(language == Language::Korean);
    }

    fn apply_config(&self, config: &Config) {
        self.apply_mode(config.toggle_mode);
        self.apply_language(config.language);
    }
}

#[cfg(windows)]
fn native_host() -> Result<Box<dyn EndpointHost>> {
    Ok(Box::new(hushkey_audio::WasapiHost::new()?))
}

#[cfg(not(windows))]
fn native_host() -> Result<Box<dyn EndpointHost>> {
    warn!("No capture-volume backend for this platform; running without device control");
    Ok(Box::new(hushkey_audio::UnsupportedHost))
}
