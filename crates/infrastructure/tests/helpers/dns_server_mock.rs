#![allow(dead_code)]

use bond_dns_infrastructure::dns::wire::{decode_message, encode_message};
use hickory_proto::op::{Message, MessageType, ResponseCode};
use hickory_proto::rr::rdata::A;
use hickory_proto::rr::{RData, Record};
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, UdpSocket};
use tokio::sync::oneshot;

/// Upstream resolver answering every A query with a fixed address.
///
/// With `truncate_udp`, UDP replies carry only the TC bit and the full answer
/// is served over TCP on the same port.
pub struct MockUpstream {
    addr: SocketAddr,
    answer: Ipv4Addr,
    udp_queries: Arc<AtomicUsize>,
    tcp_queries: Arc<AtomicUsize>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockUpstream {
    pub async fn start(answer: Ipv4Addr) -> Self {
        Self::start_with(answer, false).await
    }

    pub async fn start_truncating(answer: Ipv4Addr) -> Self {
        Self::start_with(answer, true).await
    }

    async fn start_with(answer: Ipv4Addr, truncate_udp: bool) -> Self {
        let tcp = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = tcp.local_addr().unwrap();
        let udp = UdpSocket::bind(addr).await.unwrap();

        let udp_queries = Arc::new(AtomicUsize::new(0));
        let tcp_queries = Arc::new(AtomicUsize::new(0));
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

        {
            let udp_queries = Arc::clone(&udp_queries);
            let tcp_queries = Arc::clone(&tcp_queries);
            tokio::spawn(async move {
                let mut buf = vec![0u8; 4096];
                loop {
                    tokio::select! {
                        _ = &mut shutdown_rx => break,
                        result = udp.recv_from(&mut buf) => {
                            if let Ok((len, peer)) = result {
                                udp_queries.fetch_add(1, Ordering::SeqCst);
                                let reply = Self::reply(&buf[..len], answer, truncate_udp);
                                let _ = udp.send_to(&reply, peer).await;
                            }
                        }
                        result = tcp.accept() => {
                            if let Ok((mut stream, _)) = result {
                                tcp_queries.fetch_add(1, Ordering::SeqCst);
                                tokio::spawn(async move {
                                    let mut len_buf = [0u8; 2];
                                    if stream.read_exact(&mut len_buf).await.is_err() {
                                        return;
                                    }
                                    let mut query = vec![0u8; u16::from_be_bytes(len_buf) as usize];
                                    if stream.read_exact(&mut query).await.is_err() {
                                        return;
                                    }
                                    let reply = Self::reply(&query, answer, false);
                                    let _ = stream.write_all(&(reply.len() as u16).to_be_bytes()).await;
                                    let _ = stream.write_all(&reply).await;
                                });
                            }
                        }
                    }
                }
            });
        }

        Self {
            addr,
            answer,
            udp_queries,
            tcp_queries,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    fn reply(query: &[u8], answer: Ipv4Addr, truncated: bool) -> Vec<u8> {
        let request = decode_message(query).unwrap();
        let mut reply = Message::new(request.id(), MessageType::Response, request.op_code());
        reply.set_recursion_desired(request.recursion_desired());
        reply.set_response_code(ResponseCode::NoError);
        if let Some(query) = request.queries().first() {
            reply.add_query(query.clone());
            if truncated {
                reply.set_truncated(true);
            } else {
                reply.add_answer(Record::from_rdata(
                    query.name().clone(),
                    300,
                    RData::A(A(answer)),
                ));
            }
        }
        encode_message(&reply).unwrap()
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn answer(&self) -> Ipv4Addr {
        self.answer
    }

    pub fn udp_queries(&self) -> usize {
        self.udp_queries.load(Ordering::SeqCst)
    }

    pub fn tcp_queries(&self) -> usize {
        self.tcp_queries.load(Ordering::SeqCst)
    }
}

impl Drop for MockUpstream {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
