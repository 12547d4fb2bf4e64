use rustc_hash::FxHashMap;

use crate::host::AnimationPlayer;
use crate::options::ChannelOptions;

/// Playback state of one simulated channel.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SimChannel {
    /// Normalized time in `[0, 1]`.
    pub time: f32,
    /// Playback speed; negative plays backward.
    pub speed: f32,
    /// Blend weight, 0 when stopped.
    pub weight: f32,
    /// Whether the channel is enabled.
    pub playing: bool,
    /// Whether the channel stops itself at either end of the timeline.
    pub once: bool,
}

/// Named-channel animation player advanced by explicit ticks.
#[derive(Debug, Clone)]
pub struct SimAnimator {
    channels: FxHashMap<String, SimChannel>,
    clip_ticks: f32,
}

impl SimAnimator {
    /// Player with no channels. A full clip at speed 1 lasts `clip_ticks`
    /// ticks.
    #[must_use]
    pub fn new(clip_ticks: u32) -> Self {
        Self {
            channels: FxHashMap::default(),
            clip_ticks: clip_ticks.max(1) as f32,
        }
    }

    /// Player carrying every channel named in `options`.
    #[must_use]
    pub fn for_options(options: &ChannelOptions, clip_ticks: u32) -> Self {
        let mut animator = Self::new(clip_ticks);
        for name in [
            &options.extend,
            &options.translate_x,
            &options.translate_y,
            &options.rotate_x,
            &options.rotate_y,
        ] {
            animator.add_channel(name);
        }
        animator
    }

    /// Add an idle channel.
    pub fn add_channel(&mut self, name: &str) {
        let _ = self.channels.insert(name.to_owned(), SimChannel::default());
    }

    /// Remove a channel, simulating a model that lacks it.
    pub fn remove_channel(&mut self, name: &str) {
        let _ = self.channels.remove(name);
    }

    /// Channel state by name.
    #[must_use]
    pub fn channel(&self, name: &str) -> Option<&SimChannel> {
        self.channels.get(name)
    }

    /// Advance every playing channel by one tick. One-shot channels stop at
    /// whichever end of the timeline they reach.
    pub fn tick(&mut self) {
        for channel in self.channels.values_mut() {
            if !channel.playing || channel.speed == 0.0 {
                continue;
            }
            channel.time += channel.speed / self.clip_ticks;
            if channel.time >= 1.0 || channel.time <= 0.0 {
                channel.time = channel.time.clamp(0.0, 1.0);
                if channel.once {
                    channel.playing = false;
                }
            }
        }
    }
}

impl AnimationPlayer for SimAnimator {
    fn has_channel(&self, channel: &str) -> bool {
        self.channels.contains_key(channel)
    }

    fn set_speed(&mut self, channel: &str, speed: f32) {
        if let Some(c) = self.channels.get_mut(channel) {
            c.speed = speed;
        }
    }

    fn set_time(&mut self, channel: &str, normalized_time: f32) {
        if let Some(c) = self.channels.get_mut(channel) {
            c.time = normalized_time.clamp(0.0, 1.0);
        }
    }

    fn blend(&mut self, channel: &str, _duration: f32) {
        if let Some(c) = self.channels.get_mut(channel) {
            c.weight = 1.0;
            c.playing = true;
        }
    }

    fn play_once(&mut self, channel: &str) {
        if let Some(c) = self.channels.get_mut(channel) {
            c.weight = 1.0;
            c.playing = true;
            c.once = true;
        }
    }

    fn is_playing(&self, channel: &str) -> bool {
        self.channels.get(channel).is_some_and(|c| c.playing)
    }

    fn stop(&mut self, channel: &str) {
        if let Some(c) = self.channels.get_mut(channel) {
            c.playing = false;
            c.weight = 0.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_shot_stops_at_end() {
        let mut animator = SimAnimator::new(4);
        animator.add_channel("Extend");
        animator.set_speed("Extend", 1.0);
        animator.set_time("Extend", 0.0);
        animator.play_once("Extend");

        for _ in 0..3 {
            animator.tick();
            assert!(animator.is_playing("Extend"));
        }
        animator.tick();
        assert!(!animator.is_playing("Extend"));
        assert_eq!(animator.channel("Extend").unwrap().time, 1.0);
    }

    #[test]
    fn reverse_play_stops_at_start() {
        let mut animator = SimAnimator::new(2);
        animator.add_channel("Extend");
        animator.set_speed("Extend", -1.0);
        animator.set_time("Extend", 1.0);
        animator.play_once("Extend");
        animator.tick();
        animator.tick();
        assert!(!animator.is_playing("Extend"));
        assert_eq!(animator.channel("Extend").unwrap().time, 0.0);
    }

    #[test]
    fn frozen_channel_holds_time() {
        let mut animator = SimAnimator::new(10);
        animator.add_channel("RotateXAxis");
        animator.set_speed("RotateXAxis", 0.0);
        animator.set_time("RotateXAxis", 0.25);
        animator.blend("RotateXAxis", 1.0);
        animator.tick();
        let channel = animator.channel("RotateXAxis").unwrap();
        assert_eq!(channel.time, 0.25);
        assert!(channel.playing);
    }

    #[test]
    fn missing_channel_calls_are_ignored() {
        let mut animator = SimAnimator::new(10);
        animator.set_speed("Nope", 1.0);
        animator.play_once("Nope");
        assert!(!animator.has_channel("Nope"));
        assert!(!animator.is_playing("Nope"));
    }
}
