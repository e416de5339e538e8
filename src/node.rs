//! Message-driven avoidance node.
//!
//! Routes inbound lidar frames to the [`ObstacleDetector`] and command twists
//! to the [`TwistGatekeeper`]. Every message is one run-to-completion tick.

use std::time::Instant;

use crate::avoidance::{GateDecision, TwistGatekeeper, VelocityArbiter};
use crate::config::{RakshaConfig, TopicConfig};
use crate::core::Twist;
use crate::perception::{LidarFrame, LidarFrameAggregator, ObstacleDetector};
use crate::shared::{ObstacleBoard, Publisher};
use crate::wire::{Inbound, Outbound};

/// The avoidance core wired to an outbound publisher.
pub struct AvoidanceNode<P> {
    detector: ObstacleDetector,
    gatekeeper: TwistGatekeeper<ObstacleBoard>,
    topics: TopicConfig,
    publisher: P,
}

impl<P: Publisher<Outbound>> AvoidanceNode<P> {
    /// Build every component from configuration.
    pub fn new(config: &RakshaConfig, publisher: P) -> Self {
        let board = ObstacleBoard::new();
        let aggregator = LidarFrameAggregator::new(
            config.perception.lidars.clone(),
            config.extrinsics.clone(),
            config.perception.timeout(),
        );
        let detector = ObstacleDetector::new(
            aggregator,
            config.perception.cluster.clone(),
            board.clone(),
        );
        let gatekeeper = TwistGatekeeper::new(
            VelocityArbiter::new(config.avoidance.clone()),
            board,
            config.gatekeeper.clone(),
        );

        Self {
            detector,
            gatekeeper,
            topics: config.topics.clone(),
            publisher,
        }
    }

    pub fn detector(&self) -> &ObstacleDetector {
        &self.detector
    }

    pub fn gatekeeper(&self) -> &TwistGatekeeper<ObstacleBoard> {
        &self.gatekeeper
    }

    /// Dispatch one inbound message.
    pub fn handle(&mut self, message: Inbound, now: Instant) {
        match message {
            Inbound::Twist {
                topic,
                linear,
                angular,
            } => {
                if topic != self.topics.cmd_vel_in {
                    tracing::trace!("Ignoring twist on topic {}", topic);
                    return;
                }
                self.on_command(Twist::new(linear, angular), now);
            }
            lidar @ Inbound::Lidar { .. } => {
                let detector = &self.detector;
                let Some((topic, frame)) = lidar.into_lidar_frame(|topic| {
                    detector
                        .aggregator()
                        .sources()
                        .find(|s| s.topic == topic)
                        .map(|s| s.frame_id.clone())
                }) else {
                    return;
                };
                self.on_frame(&topic, frame, now);
            }
        }
    }

    fn on_frame(&mut self, topic: &str, frame: LidarFrame, now: Instant) {
        let Some(detection) = self.detector.on_frame(topic, frame, now) else {
            return;
        };
        if self.topics.publish_obstacles {
            self.publisher.publish(Outbound::ObstaclePoints {
                topic: self.topics.obstacle_points.clone(),
                points: detection.points,
            });
            self.publisher.publish(Outbound::Obstacles {
                topic: self.topics.obstacles.clone(),
                obstacles: (*detection.obstacles).clone(),
            });
        }
    }

    /// Gate one command and publish the result.
    pub fn on_command(&mut self, command: Twist, now: Instant) -> GateDecision {
        let decision = self.gatekeeper.tick(command, now);
        if let Some(event) = &decision.fault {
            self.publisher.publish(Outbound::fault(event));
        }
        self.publisher
            .publish(Outbound::twist(&self.topics.cmd_vel_out, decision.twist));
        decision
    }

    /// Publish a final stop command.
    pub fn shutdown(&mut self) {
        tracing::info!("Publishing final stop command");
        self.publisher
            .publish(Outbound::twist(&self.topics.cmd_vel_out, Twist::ZERO));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::avoidance::GateMode;
    use crate::wire::FaultKind;
    use crossbeam_channel::{Receiver, unbounded};
    use std::time::Duration;

    fn node(publish_obstacles: bool) -> (AvoidanceNode<crossbeam_channel::Sender<Outbound>>, Receiver<Outbound>) {
        let mut config = RakshaConfig::default();
        config.topics.publish_obstacles = publish_obstacles;
        config.gatekeeper.stop_to_run_count = 1;
        let (tx, rx) = unbounded();
        (AvoidanceNode::new(&config, tx), rx)
    }

    fn lidar(angles: Vec<f32>, distances: Vec<f32>) -> Inbound {
        Inbound::Lidar {
            topic: "scan".to_string(),
            frame_id: None,
            angles,
            distances,
        }
    }

    fn twist(topic: &str, linear: f32) -> Inbound {
        Inbound::Twist {
            topic: topic.to_string(),
            linear,
            angular: 0.0,
        }
    }

    #[test]
    fn test_frame_publishes_obstacles_when_enabled() {
        let (mut node, rx) = node(true);
        node.handle(lidar(vec![0.0], vec![3.0]), Instant::now());

        let messages: Vec<_> = rx.try_iter().collect();
        assert_eq!(messages.len(), 2);
        assert!(matches!(&messages[0], Outbound::ObstaclePoints { points, .. } if points.len() == 1));
        assert!(matches!(&messages[1], Outbound::Obstacles { obstacles, .. } if obstacles.len() == 1));
    }

    #[test]
    fn test_default_config_publishes_obstacles() {
        let (tx, rx) = unbounded();
        let mut node = AvoidanceNode::new(&RakshaConfig::default(), tx);
        node.handle(lidar(vec![0.0, 0.1], vec![3.0, 3.0]), Instant::now());

        let messages: Vec<_> = rx.try_iter().collect();
        assert_eq!(messages.len(), 2);
        assert!(matches!(
            &messages[0],
            Outbound::ObstaclePoints { topic, points } if topic == "obstacle_points" && points.len() == 2
        ));
        assert!(matches!(&messages[1], Outbound::Obstacles { topic, .. } if topic == "obstacles"));
    }

    #[test]
    fn test_frame_silent_when_disabled() {
        let (mut node, rx) = node(false);
        node.handle(lidar(vec![0.0], vec![3.0]), Instant::now());
        assert!(rx.try_iter().next().is_none());
        assert_eq!(node.detector().cycles(), 1);
    }

    #[test]
    fn test_command_without_data_stops_and_reports() {
        let (mut node, rx) = node(false);
        node.handle(twist("cmdvel_in", 0.3), Instant::now());

        let messages: Vec<_> = rx.try_iter().collect();
        assert!(matches!(
            &messages[0],
            Outbound::Fault { event: FaultKind::Occurred, what, .. } if what == "obstacle"
        ));
        assert_eq!(messages[1], Outbound::twist("cmdvel", Twist::ZERO));
    }

    #[test]
    fn test_command_passes_with_clear_scan() {
        let (mut node, rx) = node(false);
        let now = Instant::now();
        node.handle(lidar(vec![0.0], vec![3.0]), now);
        node.handle(twist("cmdvel_in", 0.3), now + Duration::from_millis(10));

        assert_eq!(node.gatekeeper().mode(), GateMode::Run);
        let messages: Vec<_> = rx.try_iter().collect();
        assert_eq!(messages, vec![Outbound::twist("cmdvel", Twist::new(0.3, 0.0))]);
    }

    #[test]
    fn test_other_twist_topics_ignored() {
        let (mut node, rx) = node(false);
        node.handle(twist("teleop", 0.3), Instant::now());
        assert!(rx.try_iter().next().is_none());
    }

    #[test]
    fn test_shutdown_sends_stop() {
        let (mut node, rx) = node(false);
        node.shutdown();
        assert_eq!(rx.try_recv(), Ok(Outbound::twist("cmdvel", Twist::ZERO)));
    }
}
