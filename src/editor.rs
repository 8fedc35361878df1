use crate::audio::gate_telemetry::TelemetryConsumer;
use crate::audio::meter::MeterConsumer;
use crate::ui::UITheme;
use crate::SmartNoiseGateParams;
use nih_plug::prelude::{Editor, GuiContext};
use nih_plug_iced::widgets as nih_widgets;
use nih_plug_iced::*;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone, Copy)]
pub enum Message {
    /// Slider drag or reset, forwarded to the host
    ParamUpdate(nih_widgets::ParamMessage),
}

#[derive(Clone)]
pub struct EditorInitFlags {
    pub params: Arc<SmartNoiseGateParams>,
    pub meters: MeterConsumer,
    pub telemetry: Arc<Mutex<TelemetryConsumer>>,
}

pub fn create(
    editor_state: Arc<IcedState>,
    init_flags: EditorInitFlags,
) -> Option<Box<dyn Editor>> {
    create_iced_editor::<PluginEditor>(editor_state, init_flags)
}

pub struct PluginEditor {
    params: Arc<SmartNoiseGateParams>,
    context: Arc<dyn GuiContext>,

    meters: MeterConsumer,
    telemetry: Arc<Mutex<TelemetryConsumer>>,

    threshold_slider_state: nih_widgets::param_slider::State,
    attack_slider_state: nih_widgets::param_slider::State,
    release_slider_state: nih_widgets::param_slider::State,
    input_meter_state: nih_widgets::peak_meter::State,
    output_meter_state: nih_widgets::peak_meter::State,
}

impl IcedEditor for PluginEditor {
    type Executor = executor::Default;
    type Message = Message;
    type InitializationFlags = EditorInitFlags;

    fn new(
        initialization_flags: Self::InitializationFlags,
        context: Arc<dyn GuiContext>,
    ) -> (Self, Command<Self::Message>) {
        let editor = Self {
            params: initialization_flags.params,
            context,
            meters: initialization_flags.meters,
            telemetry: initialization_flags.telemetry,
            threshold_slider_state: Default::default(),
            attack_slider_state: Default::default(),
            release_slider_state: Default::default(),
            input_meter_state: Default::default(),
            output_meter_state: Default::default(),
        };

        (editor, Command::none())
    }

    fn context(&self) -> &dyn GuiContext {
        self.context.as_ref()
    }

    fn update(
        &mut self,
        _window: &mut WindowQueue,
        message: Self::Message,
    ) -> Command<Self::Message> {
        match message {
            Message::ParamUpdate(message) => self.handle_param_message(message),
        }

        Command::none()
    }

    fn view(&mut self) -> Element<'_, Self::Message> {
        // Pull the latest audio-thread data once per frame
        self.meters.update();
        let (input_db, output_db) = self.meters.smoothed_levels();
        let snapshot = self
            .telemetry
            .lock()
            .map(|mut telemetry| telemetry.latest())
            .unwrap_or_default();

        let gate_color = if snapshot.gate_open {
            UITheme::GATE_OPEN
        } else {
            UITheme::GATE_CLOSED
        };

        Column::new()
            .align_items(Alignment::Center)
            .spacing(UITheme::ROW_SPACING)
            .padding(UITheme::PADDING_SMALL)
            .push(
                Text::new("Smart Noise Gate")
                    .font(assets::NOTO_SANS_LIGHT)
                    .size(UITheme::TITLE_SIZE)
                    .color(UITheme::TEXT_PRIMARY)
                    .width(Length::Fill)
                    .horizontal_alignment(alignment::Horizontal::Center),
            )
            .push(param_row(
                "Threshold",
                nih_widgets::ParamSlider::new(
                    &mut self.threshold_slider_state,
                    &self.params.threshold,
                )
                .map(Message::ParamUpdate),
            ))
            .push(param_row(
                "Attack",
                nih_widgets::ParamSlider::new(&mut self.attack_slider_state, &self.params.attack)
                    .map(Message::ParamUpdate),
            ))
            .push(param_row(
                "Release",
                nih_widgets::ParamSlider::new(&mut self.release_slider_state, &self.params.release)
                    .map(Message::ParamUpdate),
            ))
            .push(param_row(
                "Input",
                nih_widgets::PeakMeter::new(&mut self.input_meter_state, input_db)
                    .hold_time(Duration::from_millis(600))
                    .into(),
            ))
            .push(param_row(
                "Output",
                nih_widgets::PeakMeter::new(&mut self.output_meter_state, output_db)
                    .hold_time(Duration::from_millis(600))
                    .into(),
            ))
            .push(Text::new(snapshot.readout()).size(16).color(gate_color))
            .into()
    }

    fn background_color(&self) -> nih_plug_iced::Color {
        UITheme::BACKGROUND_MAIN
    }
}

/// Label on the left, control on the right
fn param_row<'a>(label: &str, control: Element<'a, Message>) -> Element<'a, Message> {
    Row::new()
        .align_items(Alignment::Center)
        .push(
            Text::new(label)
                .size(16)
                .color(UITheme::TEXT_SECONDARY)
                .width(Length::Units(UITheme::LABEL_WIDTH)),
        )
        .push(control)
        .into()
}
